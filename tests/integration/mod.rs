mod anthropic;
mod client_parity;
