use std::fmt::Display;

/// The closed set of failure modes a [`crate::categorical::Categorical`] or
/// [`crate::set_ops`] operation can report. `Status::Ok` is never constructed
/// directly; a successful call is `Ok(())`/`Ok(value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    CategoryExists,
    CategoryDoesNotExist,
    LabelExistsInOtherCategory,
    LabelIsInvalidCollapsedExpression,
    WrongCategorySize,
    CategoriesDoNotMatch,
    CatOverflow,
    CollapsedExpressionInWrongCategory,
    OutOfBounds,
    WrongIndexSize,
    IncompatibleSizes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Status(Status),
}

impl Error {
    #[inline]
    pub fn status(&self) -> Status {
        match self {
            Self::Status(s) => *s,
        }
    }
}

impl From<Status> for Error {
    #[inline]
    fn from(value: Status) -> Self {
        Self::Status(value)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::CategoryExists => "category already exists",
            Self::CategoryDoesNotExist => "category does not exist",
            Self::LabelExistsInOtherCategory => "label exists in another category",
            Self::LabelIsInvalidCollapsedExpression => {
                "label is a collapsed expression reserved for another category"
            }
            Self::WrongCategorySize => "wrong category size",
            Self::CategoriesDoNotMatch => "categories do not match",
            Self::CatOverflow => "size would overflow",
            Self::CollapsedExpressionInWrongCategory => {
                "collapsed expression used in the wrong category"
            }
            Self::OutOfBounds => "index out of bounds",
            Self::WrongIndexSize => "wrong index size",
            Self::IncompatibleSizes => "incompatible sizes",
        };
        write!(f, "{msg}")
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(s) => Display::fmt(s, f),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
