//! Flight route planner server.
//!
//! A web application that answers: "leaving this airport on this day,
//! which flights get me to my destination soonest?"

pub mod cache;
pub mod domain;
pub mod planner;
pub mod repository;
pub mod web;
