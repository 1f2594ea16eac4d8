pub mod stripe_invoice_service;
