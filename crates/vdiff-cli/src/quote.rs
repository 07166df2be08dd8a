//! POSIX shell quoting, used to log the command line.

use std::borrow::Cow;
use std::ffi::OsStr;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || "@%+=:,./-".contains(c)
}

/// Quote `s` so a POSIX shell reads it back as a single word.
pub fn quote(s: &str) -> Cow<'_, str> {
    if s.is_empty() {
        return Cow::Borrowed("''");
    }
    if s.chars().all(is_safe) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(format!("'{}'", s.replace('\'', r#"'"'"'"#)))
}

/// Quote each argument and join them with spaces. Arguments that are not
/// valid UTF-8 are converted lossily.
pub fn quote_command<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .map(|a| quote(&a.as_ref().to_string_lossy()).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
