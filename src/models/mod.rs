mod account;
mod course;
mod notice;
mod notification;
mod subject;

pub use account::{
    Account, FacultyProfile, NewAccount, StudentIdentifiers, StudentProfile, UpdateAccount,
};
pub use course::{Course, NewCourse};
pub use notice::{NewNotice, Notice, NoticeAudience};
pub use notification::{NewNotificationLog, NotificationLog, NotificationStatus};
pub use subject::{Enrollment, NewSubject, Subject};
