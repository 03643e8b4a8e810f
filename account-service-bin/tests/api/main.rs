mod accounts;
mod authentication;
mod helpers;
