mod config_file;
mod reinit;
mod servo_path;
mod transport;
