use crate::driver::{Instance, SealedInstance};
use embassy_stm32::pac;
use embassy_stm32::peripherals as peri;

macro_rules! impl_bxcan {
    ($peri:ident, $pac_peri:ident) => {
        impl SealedInstance for peri::$peri {
            fn registers() -> pac::can::Can {
                pac::$pac_peri
            }
        }

        impl Instance for peri::$peri {}
    };
}

impl_bxcan!(CAN, CAN);
