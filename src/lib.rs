// src/lib.rs
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod screens;
pub mod services;
pub mod state;
pub mod web;
