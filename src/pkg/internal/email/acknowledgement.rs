use std::fmt::{self, Display};

pub const SUBJECT: &str = "Thank you for contacting us!";

pub struct Acknowledgement<'a> {
    pub name: &'a str,
    pub service: &'a str,
    pub owner_name: &'a str,
}

impl<'a> Display for Acknowledgement<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hi {},\n\nThank you for reaching out to us regarding {}. We have received your message and will get back to you shortly.\n\nBest regards,\n{}",
            self.name, self.service, self.owner_name
        )
    }
}
