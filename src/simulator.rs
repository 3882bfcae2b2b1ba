//! Balance simulator for Goose University.
//! Run with: cargo test simulate_greedy -- --nocapture
