mod test_order_confirmation;
