mod admin_test;
mod config_test;
mod room_test;
mod router_test;
