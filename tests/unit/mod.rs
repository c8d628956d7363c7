mod common;

mod invariants;

mod determinism;

mod optimizer_resume;
