//! TOFS safety-observation cards.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Role | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/reports` | any | Filtered, paginated listing |
//! | GET | `/api/reports/filter-options` | any | Values for the filter form |
//! | GET | `/api/reports/export` | any | Filtered listing as XLSX |
//! | GET | `/api/reports/{id}` | any | Single report |
//! | POST | `/api/reports` | any | Submit a card |
//! | PUT | `/api/reports/{id}` | admin, super admin | Overwrite a card |
//! | DELETE | `/api/reports/{id}` | admin, super admin | Delete a card |

pub mod card_number;
pub mod dtos;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
