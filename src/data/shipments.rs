use crate::shared::*;

/// Seeds the shop's opening stock from the shipment table. The first
/// restock of the day is what keeps it filled afterwards.
pub fn seed_initial_stock(stock: &mut StockLedger) {
    for (item, quantity) in SHIPMENT_STOCK {
        stock.set(item, *quantity);
    }
}

/// A new farm starts with a little of everything the hen house needs, so
/// the player can feed before their first shop trip.
pub fn seed_starting_inventory(inventory: &mut Inventory) {
    inventory.add("Hay", 10.0);
    inventory.add("Kernel Blend", 5.0);
    inventory.add(MEDICINE_ITEM, 1.0);
    inventory.add("Petting Hand", 2.0);
}
