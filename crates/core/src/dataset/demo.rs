use super::Dataset;
use crate::domain::product::{turnover_rate, Product};
use crate::pricing::action_table::ActionTable;

// name, category, unit price, days to expiry, stock, weekly sales, inventory turnover
const DEMO_PRODUCTS: [(&str, &str, f64, u32, u32, u32, f64); 15] = [
    ("Strawberries", "Fruits & Vegetables", 6.0, 4, 94, 40, 84.0),
    ("Organic Bananas", "Fruits & Vegetables", 2.5, 7, 156, 65, 92.0),
    ("Greek Yogurt", "Dairy", 4.99, 11, 78, 25, 68.0),
    ("Whole Wheat Bread", "Bakery", 3.49, 3, 45, 18, 75.0),
    ("Premium Ground Coffee", "Beverages", 12.99, 75, 120, 35, 45.0),
    ("Fresh Salmon Fillet", "Seafood", 18.99, 2, 32, 12, 95.0),
    ("Organic Spinach", "Fruits & Vegetables", 3.99, 5, 67, 28, 78.0),
    ("Aged Cheddar Cheese", "Dairy", 8.99, 44, 89, 22, 52.0),
    ("Sourdough Bread", "Bakery", 4.99, 4, 38, 16, 82.0),
    ("Organic Milk", "Dairy", 5.49, 9, 124, 45, 88.0),
    ("Free-Range Eggs", "Dairy", 6.99, 17, 156, 38, 65.0),
    ("Avocados", "Fruits & Vegetables", 1.99, 6, 89, 42, 89.0),
    ("Chicken Breast", "Meat", 9.99, 4, 67, 28, 76.0),
    ("Blueberries", "Fruits & Vegetables", 7.99, 6, 78, 32, 81.0),
    ("Artisan Pasta", "Pantry", 3.99, 202, 145, 25, 35.0),
];

impl Dataset {
    /// Built-in catalog served when no dataset has been uploaded.
    pub fn demo() -> Self {
        let products = DEMO_PRODUCTS
            .iter()
            .map(|&(name, category, unit_price, days, stock, sales, itr)| Product {
                name: name.to_string(),
                category: category.to_string(),
                unit_price,
                stock_quantity: stock,
                sales_volume: sales,
                days_to_expiry: days,
                turnover_rate: turnover_rate(sales, stock),
                inventory_turnover_rate: itr,
                state: None,
                region: None,
                season: None,
            })
            .collect();

        Dataset::new(products, Some(ActionTable::generate_default()))
    }
}
