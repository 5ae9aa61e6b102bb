mod invoices;
mod paylinks;
mod refunds;
