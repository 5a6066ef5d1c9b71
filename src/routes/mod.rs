/**
 * Routes Module
 * API route handlers
 */

pub mod contact;
pub mod diagnostics;
pub mod meta;
pub mod projects;
pub mod validated;
