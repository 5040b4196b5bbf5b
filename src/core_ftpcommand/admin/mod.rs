// Store mutations reserved for the admin role. None of these verbs can be
// granted to a regular user.
pub mod adduser;
pub mod deluser;
pub mod grant;
pub mod helper;
pub mod setrole;
