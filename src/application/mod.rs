// Ranking pipeline orchestration
pub mod spot_ranking_service;

// Console rendering
pub mod reporting;
