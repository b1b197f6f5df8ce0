pub(crate) mod snake_model;
