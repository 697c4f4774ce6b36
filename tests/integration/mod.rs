mod notifications;
mod offers;
mod reconciliation;
