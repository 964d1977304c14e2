pub mod trackers;
