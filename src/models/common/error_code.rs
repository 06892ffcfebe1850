/// 业务错误码，随 `ApiResponse.code` 以整数返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,

    // 课程与选课
    CourseNotFound = 3000,
    CourseCreationFailed = 3001,
    CourseUpdateFailed = 3002,
    CoursePermissionDenied = 3003,
    EnrollmentNotFound = 3010,
    EnrollmentAlreadyExists = 3011,
    EnrollmentFailed = 3012,
    AssignmentNotFound = 3020,
    AssignmentInvalid = 3021,
    GradeInvalid = 3030,
    GradeUpdateFailed = 3031,

    // 学生与教职工
    StudentNotFound = 4000,
    StaffNotFound = 4001,
    AccountCreationFailed = 4010,
    AccountUpdateFailed = 4011,
    AccountDeleteFailed = 4012,
    UserEmailInvalid = 4020,
    UserPasswordInvalid = 4021,
    UserRoleInvalid = 4022,

    // 闪卡
    DeckNotFound = 5000,
    DeckPermissionDenied = 5001,
    CardNotFound = 5010,
    CardPermissionDenied = 5011,
}
