//! Blue Pill heartbeat
//!
//! Acquires a timer and a USART through the peripheral managers, routes the
//! timer's update interrupt through the dispatch table, and streams the trace
//! records out of USART1 TX (PA9, 115200 8N1).
//!
//! Runs from the reset clock (8 MHz HSI).

#![no_std]
#![no_main]

use core::convert::Infallible;
use core::ptr;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use cortex_m::peripheral::NVIC;
use cortex_m_rt::{entry, exception};
use panic_halt as _;
use prm_mgr::{IrqCallback, PrmResult};
use prm_stm32f1::{
    timers, uarts, Bus, BusClocks, CounterWidth, Irqs, PeriphAddr, Rcc, RccGate, TimerManager,
    TimerUse, UartClass, UartManager, UartUse,
};
use prm_trace::{filters, trace_ids, TraceRecord};

static IRQS: Irqs = Irqs::new();

static HEARTBEAT_BASE: AtomicUsize = AtomicUsize::new(0);
static BEATS: AtomicU32 = AtomicU32::new(0);

const CLOCKS: BusClocks = BusClocks::HSI_8MHZ;
const BAUD: u32 = 115_200;

// GPIOA
const GPIOA_BASE: usize = 0x4001_0800;
const GPIOA_GATE: RccGate = RccGate::new(Bus::Apb2, 2);
const GPIO_CRH: usize = 0x04;

// TIMx
const TIM_CR1: usize = 0x00;
const TIM_DIER: usize = 0x0C;
const TIM_SR: usize = 0x10;
const TIM_PSC: usize = 0x28;
const TIM_ARR: usize = 0x2C;
const TIM_CR1_CEN: u32 = 1 << 0;
const TIM_DIER_UIE: u32 = 1 << 0;

// USARTx
const USART_SR: usize = 0x00;
const USART_DR: usize = 0x04;
const USART_BRR: usize = 0x08;
const USART_CR1: usize = 0x0C;
const USART_SR_TXE: u32 = 1 << 7;
const USART_CR1_TE: u32 = 1 << 3;
const USART_CR1_UE: u32 = 1 << 13;

fn reg(base: usize, offset: usize) -> *mut u32 {
    (base + offset) as *mut u32
}

fn write(base: usize, offset: usize, value: u32) {
    // SAFETY: callers only pass register blocks this firmware owns
    unsafe { ptr::write_volatile(reg(base, offset), value) }
}

fn read(base: usize, offset: usize) -> u32 {
    // SAFETY: see `write`
    unsafe { ptr::read_volatile(reg(base, offset)) }
}

fn on_heartbeat() {
    let base = HEARTBEAT_BASE.load(Ordering::Relaxed);
    write(base, TIM_SR, 0);

    let beat = BEATS.fetch_add(1, Ordering::Relaxed) + 1;
    prm_trace::with_buffer(|buf| {
        if buf.begin(TraceRecord::USER, trace_ids::APP_BASE) {
            buf.u32(beat);
            buf.end();
        }
    });
}

fn start_heartbeat(tim: PeriphAddr, clock_hz: u32) {
    let base = tim.addr();
    HEARTBEAT_BASE.store(base, Ordering::Relaxed);

    // 1 kHz count, 1 Hz update
    write(base, TIM_PSC, clock_hz / 1_000 - 1);
    write(base, TIM_ARR, 1_000 - 1);
    write(base, TIM_SR, 0);
    write(base, TIM_DIER, TIM_DIER_UIE);
    write(base, TIM_CR1, TIM_CR1_CEN);
}

fn start_console(usart: PeriphAddr, clock_hz: u32) {
    // PA9 as alternate function push-pull, 50 MHz
    let crh = read(GPIOA_BASE, GPIO_CRH) & !(0xF << 4);
    write(GPIOA_BASE, GPIO_CRH, crh | (0b1011 << 4));

    let base = usart.addr();
    write(base, USART_BRR, (clock_hz + BAUD / 2) / BAUD);
    write(base, USART_CR1, USART_CR1_UE | USART_CR1_TE);
}

fn send(usart: PeriphAddr, bytes: &[u8]) {
    for &byte in bytes {
        while read(usart.addr(), USART_SR) & USART_SR_TXE == 0 {}
        write(usart.addr(), USART_DR, u32::from(byte));
    }
}

fn run() -> PrmResult<Infallible> {
    prm_trace::init();
    prm_trace::global_filter_mask(
        filters::PERIPH_RECORDS | filters::CLOCK_RECORDS | filters::IRQ_RECORDS | filters::USER_RECORDS,
    );
    prm_trace::target_info("bluepill");
    prm_trace::trace_obj_dict!(&IRQS as *const Irqs as usize, "IRQS");

    // SAFETY: every RCC writer below goes through a manager's critical section
    let mut rcc = unsafe { Rcc::new() };
    critical_section::with(|_| rcc.enable(GPIOA_GATE));

    let timers: TimerManager<_, { timers::medium_density::COUNT }> =
        TimerManager::new(timers::medium_density::table(&CLOCKS), rcc)?;
    // SAFETY: as above
    let uarts: UartManager<_, { uarts::medium_density::COUNT }> =
        UartManager::new(uarts::medium_density::table(&CLOCKS), unsafe { Rcc::new() })?;

    let console = uarts
        .acquire_by_class(UartClass::Uart, UartUse::Serial)
        .ok_or(prm_mgr::PrmError::PeripheralBusy)?;
    uarts.enable_clock(console);
    let console_regs = uarts.handle(console)?;
    start_console(console_regs, uarts.clock_hz(console)?);

    let heartbeat = timers
        .acquire_by_class(CounterWidth::Bits16, TimerUse::PeriodicIrq)
        .ok_or(prm_mgr::PrmError::PeripheralBusy)?;
    timers.enable_clock(heartbeat);
    let update = timers.irq(heartbeat)?.update;
    IRQS.attach(update, IrqCallback::Function(on_heartbeat))?;
    start_heartbeat(timers.handle(heartbeat)?, timers.clock_hz(heartbeat)?);

    // SAFETY: the dispatch table has a callback for this line
    unsafe { NVIC::unmask(update) };

    let mut chunk = [0u8; 32];
    loop {
        let n = prm_trace::read(&mut chunk);
        if n == 0 {
            cortex_m::asm::wfi();
        } else {
            send(console_regs, &chunk[..n]);
        }
    }
}

#[entry]
fn main() -> ! {
    let err = match run() {
        Ok(never) => match never {},
        Err(err) => err,
    };
    panic!("start-up failed: {}", err);
}

#[exception]
unsafe fn DefaultHandler(irqn: i16) {
    if let Ok(line) = u16::try_from(irqn) {
        IRQS.dispatch(line);
    }
}
