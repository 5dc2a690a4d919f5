pub mod town_settings;
