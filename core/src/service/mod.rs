pub mod attendance;
pub mod board;
pub mod dto;
pub mod schedule;
pub mod subject_service;
pub mod task_service;
pub mod timetable_service;
