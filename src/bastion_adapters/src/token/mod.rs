pub mod jwt_token_service;
