use std::fmt::{self, Display};

pub const SUBJECT: &str = "New contact form submission";

pub struct Notification<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub service: &'a str,
    pub message: &'a str,
}

impl<'a> Display for Notification<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You have received a new message from your contact form:\n\nName: {}\nEmail: {}\nService: {}\nMessage: {}\n\nPlease respond promptly.",
            self.name, self.email, self.service, self.message
        )
    }
}
