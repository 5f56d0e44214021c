use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown transition code: {0}")]
pub struct UnknownTransition(pub i64);

/// How a visit was reached, as recorded in `moz_historyvisits.visit_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Followed a link into a new top-level page.
    Link,
    /// Typed into the address bar or picked from autocomplete or history.
    Typed,
    Bookmark,
    /// Inner content loaded by a page.
    Embed,
    RedirectPerm,
    RedirectTemp,
    Download,
    /// Followed a link inside a frame.
    FramedLink,
    Reload,
}

impl Transition {
    pub const ALL: [Transition; 9] = [
        Transition::Link,
        Transition::Typed,
        Transition::Bookmark,
        Transition::Embed,
        Transition::RedirectPerm,
        Transition::RedirectTemp,
        Transition::Download,
        Transition::FramedLink,
        Transition::Reload,
    ];

    pub fn code(self) -> i64 {
        match self {
            Transition::Link => 1,
            Transition::Typed => 2,
            Transition::Bookmark => 3,
            Transition::Embed => 4,
            Transition::RedirectPerm => 5,
            Transition::RedirectTemp => 6,
            Transition::Download => 7,
            Transition::FramedLink => 8,
            Transition::Reload => 9,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transition::Link => "LINK",
            Transition::Typed => "TYPED",
            Transition::Bookmark => "BOOKMARK",
            Transition::Embed => "EMBED",
            Transition::RedirectPerm => "REDIRECT_PERM",
            Transition::RedirectTemp => "REDIRECT_TEMP",
            Transition::Download => "DOWNLOAD",
            Transition::FramedLink => "FRAMED_LINK",
            Transition::Reload => "RELOAD",
        }
    }
}

impl TryFrom<i64> for Transition {
    type Error = UnknownTransition;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Transition::Link),
            2 => Ok(Transition::Typed),
            3 => Ok(Transition::Bookmark),
            4 => Ok(Transition::Embed),
            5 => Ok(Transition::RedirectPerm),
            6 => Ok(Transition::RedirectTemp),
            7 => Ok(Transition::Download),
            8 => Ok(Transition::FramedLink),
            9 => Ok(Transition::Reload),
            other => Err(UnknownTransition(other)),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

pub fn classify(code: i64) -> Result<Transition, UnknownTransition> {
    Transition::try_from(code)
}
