mod cache;
mod meals;
mod mutation;

pub use cache::Query;
pub use meals::MealQueries;
pub use mutation::{MutationKind, MutationStatus, MutationTracker, PendingMutation};
