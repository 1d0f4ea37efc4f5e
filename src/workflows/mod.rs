pub mod plan_review;
