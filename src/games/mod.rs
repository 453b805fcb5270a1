pub mod spyfall;
