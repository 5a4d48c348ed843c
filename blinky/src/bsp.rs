//! Board support: one open-drain LED on GPIOG pin 6 (STM32F4).

#[cfg(target_arch = "arm")]
mod led {
    use core::ptr::{read_volatile, write_volatile};

    const RCC_AHB1ENR: *mut u32 = 0x4002_3830 as *mut u32;
    const GPIOG_MODER: *mut u32 = 0x4002_1800 as *mut u32;
    const GPIOG_OTYPER: *mut u32 = 0x4002_1804 as *mut u32;
    const GPIOG_OSPEEDR: *mut u32 = 0x4002_1808 as *mut u32;
    const GPIOG_PUPDR: *mut u32 = 0x4002_180c as *mut u32;
    const GPIOG_BSRR: *mut u32 = 0x4002_1818 as *mut u32;

    const LED_PIN: u32 = 6;

    unsafe fn set_field(register: *mut u32, value: u32) {
        unsafe {
            let cleared = read_volatile(register) & !(0b11 << (LED_PIN * 2));
            write_volatile(register, cleared | (value << (LED_PIN * 2)));
        }
    }

    /// Clocks GPIOG and configures the pin: output, open drain, high speed,
    /// pull-up, LED off.
    pub fn init() {
        unsafe {
            write_volatile(RCC_AHB1ENR, read_volatile(RCC_AHB1ENR) | (1 << 6));
            set_field(GPIOG_MODER, 0b01);
            let otyper = read_volatile(GPIOG_OTYPER);
            write_volatile(GPIOG_OTYPER, otyper | (1 << LED_PIN));
            set_field(GPIOG_OSPEEDR, 0b11);
            set_field(GPIOG_PUPDR, 0b01);
        }
        led_off();
    }

    pub fn led_on() {
        unsafe {
            write_volatile(GPIOG_BSRR, 1 << LED_PIN);
        }
    }

    pub fn led_off() {
        unsafe {
            write_volatile(GPIOG_BSRR, 1 << (LED_PIN + 16));
        }
    }
}

#[cfg(not(target_arch = "arm"))]
mod led {
    pub fn init() {
        log::debug!("hosted board: LED is a log line");
    }

    pub fn led_on() {
        log::info!("LED on");
    }

    pub fn led_off() {
        log::info!("LED off");
    }
}

pub use led::{init, led_off, led_on};
