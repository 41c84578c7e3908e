pub mod contact_filter;
