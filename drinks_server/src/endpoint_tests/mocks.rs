use drinks_engine::{
    db_types::{Drink, DrinkUpdate, NewDrink},
    traits::{DrinkManagement, DrinkStoreError},
};
use mockall::mock;

mock! {
    pub DrinkManager {}
    impl DrinkManagement for DrinkManager {
        async fn fetch_drinks(&self) -> Result<Vec<Drink>, DrinkStoreError>;
        async fn fetch_drink(&self, id: i64) -> Result<Option<Drink>, DrinkStoreError>;
        async fn insert_drink(&self, drink: NewDrink) -> Result<Drink, DrinkStoreError>;
        async fn update_drink(&self, id: i64, update: DrinkUpdate) -> Result<Drink, DrinkStoreError>;
        async fn delete_drink(&self, id: i64) -> Result<i64, DrinkStoreError>;
    }
}
