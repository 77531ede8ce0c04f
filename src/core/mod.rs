pub mod cancel;

pub mod coordinator;

pub mod counter;

pub mod item;

pub mod job;

pub mod step;

