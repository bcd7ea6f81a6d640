//! Small browser helpers shared by pages and the socket task.

pub mod alert;
