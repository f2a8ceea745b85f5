pub mod d410_sales_overview;
