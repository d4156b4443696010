mod debug_invariants;
mod labels_tests;
