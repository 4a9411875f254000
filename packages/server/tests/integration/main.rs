mod common;

mod auth;
mod catalog;
