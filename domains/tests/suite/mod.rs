mod cart;
mod email;
mod package;
mod payment;
