//! An implementation of the [did:web] method.
//!
//! [did:web]: https://w3c-ccg.github.io/did-method-web

/// An implementation of the `did:web` method. See the [module](self) docs for more
/// info.
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub struct DidWeb;
