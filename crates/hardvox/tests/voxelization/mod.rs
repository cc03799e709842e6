mod configuration;
mod scale_pass;
