pub mod category_menu;
pub mod challenge_view;
pub mod pre_config;
pub mod progress_bar;
pub mod shop;
pub mod summary;
