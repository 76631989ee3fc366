mod admin;
mod helpers;
mod login;
mod login_two_factor;
mod logout;
mod refresh;
mod two_factor;
