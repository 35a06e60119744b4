pub mod courses;
pub mod rounds;
pub mod statistics;
pub mod users;

pub use courses::CoursesDao;
pub use rounds::RoundsDao;
pub use statistics::StatisticsDao;
pub use users::UsersDao;
