pub mod assignments;

pub mod auth;

pub mod evaluations;

pub mod surveys;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use auth::configure_auth_routes;
pub use evaluations::configure_evaluation_routes;
pub use surveys::configure_survey_routes;
pub use users::configure_user_routes;
