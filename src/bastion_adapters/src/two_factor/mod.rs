pub mod totp_verifier;
