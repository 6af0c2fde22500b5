/*!
 * Verified session extractor
 *
 * Responsibility:
 * - 検証済みの session token (VerifiedSession) を handler に提供する
 * - 値は session middleware だけが request extensions に入れる
 *
 * Public API:
 * - SessionCtx
 */

mod core;

pub use self::core::SessionCtx;
