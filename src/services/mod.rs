pub mod standing;
