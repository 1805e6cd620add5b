pub mod client;

pub use client::{HttpMealApi, MealApi};
