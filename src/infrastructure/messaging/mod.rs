pub mod postgres_chat;
