mod cli_config;
mod cli_init;
mod cli_install;
mod cli_lifecycle;
mod cli_list;
