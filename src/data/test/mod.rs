mod listener_role;
mod sponsor;
mod user_app;
