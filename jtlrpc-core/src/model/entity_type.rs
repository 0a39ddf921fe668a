use std::fmt;

/// The closed set of entity types a controller can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Category,
    CrossSelling,
    Customer,
    CustomerGroup,
    CustomerOrder,
    DeliveryNote,
    GlobalData,
    /// Every image relation (product, category, manufacturer, ...) shares this type.
    Image,
    Manufacturer,
    Payment,
    Product,
    ProductPrice,
    ProductStockLevel,
    Specific,
    StatusChange,
}

impl EntityType {
    pub const ALL: [EntityType; 15] = [
        EntityType::Category,
        EntityType::CrossSelling,
        EntityType::Customer,
        EntityType::CustomerGroup,
        EntityType::CustomerOrder,
        EntityType::DeliveryNote,
        EntityType::GlobalData,
        EntityType::Image,
        EntityType::Manufacturer,
        EntityType::Payment,
        EntityType::Product,
        EntityType::ProductPrice,
        EntityType::ProductStockLevel,
        EntityType::Specific,
        EntityType::StatusChange,
    ];

    /// Resolves a controller name (`customer_order`) to its entity type.
    pub fn from_controller(controller: &str) -> Option<Self> {
        let entity_type = match controller {
            "category" => EntityType::Category,
            "cross_selling" => EntityType::CrossSelling,
            "customer" => EntityType::Customer,
            "customer_group" => EntityType::CustomerGroup,
            "customer_order" => EntityType::CustomerOrder,
            "delivery_note" => EntityType::DeliveryNote,
            "global_data" => EntityType::GlobalData,
            "image" => EntityType::Image,
            "manufacturer" => EntityType::Manufacturer,
            "payment" => EntityType::Payment,
            "product" => EntityType::Product,
            "product_price" => EntityType::ProductPrice,
            "product_stock_level" => EntityType::ProductStockLevel,
            "specific" => EntityType::Specific,
            "status_change" => EntityType::StatusChange,
            _ => return None,
        };
        Some(entity_type)
    }

    /// The controller name serving this entity type.
    pub fn controller(&self) -> &'static str {
        match self {
            EntityType::Category => "category",
            EntityType::CrossSelling => "cross_selling",
            EntityType::Customer => "customer",
            EntityType::CustomerGroup => "customer_group",
            EntityType::CustomerOrder => "customer_order",
            EntityType::DeliveryNote => "delivery_note",
            EntityType::GlobalData => "global_data",
            EntityType::Image => "image",
            EntityType::Manufacturer => "manufacturer",
            EntityType::Payment => "payment",
            EntityType::Product => "product",
            EntityType::ProductPrice => "product_price",
            EntityType::ProductStockLevel => "product_stock_level",
            EntityType::Specific => "specific",
            EntityType::StatusChange => "status_change",
        }
    }

    /// The model type name, e.g. `CustomerOrder`. Images use the shared `AbstractImage` type.
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityType::Category => "Category",
            EntityType::CrossSelling => "CrossSelling",
            EntityType::Customer => "Customer",
            EntityType::CustomerGroup => "CustomerGroup",
            EntityType::CustomerOrder => "CustomerOrder",
            EntityType::DeliveryNote => "DeliveryNote",
            EntityType::GlobalData => "GlobalData",
            EntityType::Image => "AbstractImage",
            EntityType::Manufacturer => "Manufacturer",
            EntityType::Payment => "Payment",
            EntityType::Product => "Product",
            EntityType::ProductPrice => "ProductPrice",
            EntityType::ProductStockLevel => "ProductStockLevel",
            EntityType::Specific => "Specific",
            EntityType::StatusChange => "StatusChange",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
