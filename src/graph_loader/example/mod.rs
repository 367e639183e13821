pub mod karate_club;
