//! Dispatches GitHub Actions workflows through the GitHub REST API.
//!
//! The crate lists the workflows of a repository, keeps the ones that are active and present in the local working copy,
//! resolves one of them by name or through an interactive prompt, and triggers a `workflow_dispatch` event for it.
//!
//! See: [`transactions::dispatch`]

pub mod env;
pub mod error;
pub mod git;
pub mod prompt;
pub mod transactions;
pub mod workflow;

pub use error::DispatchError;

/// A shorthand to define a statically allocated variable using a [`std::sync::LazyLock`].
///
/// # Examples
///
/// ```rust
/// # use workflow_dispatch::static_lazy_lock;
/// # use std::sync::LazyLock;
/// static_lazy_lock! {
///     pub VAR_1: String = String::from("a static variable");
/// }
/// // ...equals to...
/// pub static VAR_2: LazyLock<String> = LazyLock::new(|| String::from("a static variable"));
/// ```
#[macro_export]
macro_rules! static_lazy_lock {
    ($(#[$meta:meta])* $vis:vis $name:ident: $type:ty = $expr:expr $(;)?) => {
        $(#[$meta])*
        $vis static $name: $crate::__priv_macro_use::LazyLock<$type> =
            $crate::__priv_macro_use::LazyLock::new(|| $expr);
    };
}

#[doc(hidden)]
pub mod __priv_macro_use {
    pub use std::sync::LazyLock;
}
