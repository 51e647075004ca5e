/*
 * Responsibility
 * - handler 向け extractor の公開
 */
mod claims;

pub use claims::AuthClaims;
