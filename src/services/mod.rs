/*
 * Responsibility
 * - outbound collaborators (identity provider)
 */
pub mod identity;
